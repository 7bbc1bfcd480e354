pub mod page_renderer;

pub use page_renderer::render_page;
