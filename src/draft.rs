pub(crate) mod entities;
pub(crate) mod model;
pub(crate) mod project;
pub(crate) mod template;
