use crate::pagination::PagePlan;
use crate::search::ResultRecord;
use crate::services::query_controller::RenderTarget;

/// What the results view currently shows
#[derive(Debug, Clone, Default)]
pub struct ResultsPane {
    pub query: String,
    pub records: Vec<ResultRecord>,
    pub plan: PagePlan,
    pub result_info: String,
    pub loading: bool,
    /// Highlighted row of the list
    pub selected: usize,
    renders: usize,
}

impl ResultsPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a page has been rendered
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

impl RenderTarget for ResultsPane {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_result_info(&mut self, text: &str) {
        self.result_info = text.to_string();
    }

    fn render_page(&mut self, query: &str, records: &[ResultRecord], plan: &PagePlan) {
        self.query = query.to_string();
        self.records = records.to_vec();
        self.plan = plan.clone();
        self.selected = 0;
        self.renders += 1;
    }
}
