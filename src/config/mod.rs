//! Configuration model: channels, stages and their JSON form.

pub(crate) mod model;
