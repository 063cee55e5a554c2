pub mod application_orchestrator;
pub mod fetch_worker;
pub mod query_controller;

pub use application_orchestrator::{
    ApplicationOrchestrator, ApplicationOrchestratorBuilder, EventOutcome,
};
pub use fetch_worker::{FetchWorker, Job, WorkerEvent};
pub use query_controller::{
    Dispatch, FetchKind, FetchRequest, PageTarget, QueryController, RenderTarget, ResponseOutcome,
};
