mod request;
mod schema;

pub use request::{ActionRequest, Argument, SelectPointAct, SelectWorker};
pub use schema::{ActionSchema, ActionSpace, ArgKind, FunctionId, FunctionName};
