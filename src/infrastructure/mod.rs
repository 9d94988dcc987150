// Infrastructure layer - AWS adapters and settings
pub mod aws_clients;
pub mod cloudwatch_repository;
pub mod config;
pub mod tagging_inventory;
