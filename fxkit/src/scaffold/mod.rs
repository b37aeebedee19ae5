//! Scaffold actions, the runner that sequences them, and the standard flows

pub mod action;
pub mod flows;
pub mod policy;
pub mod runner;

pub use action::{ScaffoldAction, ScaffoldActionName, ScaffoldContext};
pub use flows::{
    valid_sample_destination, SampleRequest, ScaffoldOutcome, Scaffolder, TemplateRequest,
};
pub use policy::{PassthroughPolicy, SampleErrorPolicy, TemplateErrorPolicy};
pub use runner::{ActionErrorHandler, ScaffoldRunner};
