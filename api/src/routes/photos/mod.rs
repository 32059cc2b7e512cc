pub mod photo_request;
pub mod photo_route;
