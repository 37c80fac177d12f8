mod content_repo;
mod screen_repo;

pub use content_repo::ContentRepo;
pub use screen_repo::ScreenRepo;
