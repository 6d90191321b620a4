pub mod renderer;
pub mod webdriver;

pub use renderer::Renderer;
pub use webdriver::{SessionOptions, WebDriverSession};
