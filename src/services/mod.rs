pub mod estimator; // estimator trait
pub mod groq; // Groq chat-completions client
pub mod image; // image loading + inline encoding

pub use estimator::CarbEstimator;
pub use groq::GroqService;
pub use image::ImageService;
