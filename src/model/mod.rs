pub use content::*;
pub use views::*;

mod content;
mod views;
