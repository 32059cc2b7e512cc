pub mod triage_request;
pub mod triage_response;
pub mod triage_route;
