// Domain layer - dashboard, widget and service models
pub mod arn;
pub mod dimension;
pub mod metric;
pub mod service;
pub mod slo;
pub mod widget;
