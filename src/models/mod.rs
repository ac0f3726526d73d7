mod content;
mod kind;
mod parent;
mod widget;

pub use content::*;
pub use kind::*;
pub use parent::*;
pub use widget::*;
