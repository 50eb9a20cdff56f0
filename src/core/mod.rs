pub mod callback;
pub mod dispatcher;
pub mod events;
pub mod model;
pub mod queue;
pub mod sinks;
pub mod store;
