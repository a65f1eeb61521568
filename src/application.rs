//! Application layer: one validator per external authority
//!
//! Each validator uploads or pipes a document to its authority and turns the
//! response into a report. They hold no mutable state and can be shared
//! across tasks.

pub mod amp_validator;
pub mod css_validator;
pub mod html_validator;
pub mod results_page;

pub use amp_validator::AmpValidator;
pub use css_validator::CssValidator;
pub use html_validator::HtmlValidator;
pub use results_page::render_amp_results_page;
