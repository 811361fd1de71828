pub mod config_ops;
pub mod inspect_ops;
pub mod replay_ops;
