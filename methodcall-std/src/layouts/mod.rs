//! Standard layouts.

mod literal;
mod template;

pub use literal::Literal;
pub use template::TemplateLayout;
