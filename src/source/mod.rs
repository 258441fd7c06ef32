pub(crate) mod config_source;
