pub(crate) mod archive;
pub(crate) mod packager;
pub(crate) mod sink;
