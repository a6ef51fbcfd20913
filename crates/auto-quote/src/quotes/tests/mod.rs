mod common;
mod pricing;
mod routing;
mod service;
