// Application layer - discovery, widget synthesis and publishing use cases
pub mod dashboard_publisher;
pub mod dashboard_service;
pub mod dimension_resolver;
pub mod discovery;
pub mod ec2_probe;
pub mod error;
pub mod layout;
pub mod metrics_repository;
pub mod resource_inventory;
pub mod slo_builder;
pub mod widget_builders;

#[cfg(test)]
pub mod testing;
