pub(crate) mod renderer;
