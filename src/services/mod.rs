// Stampbook services
// Services are stateless or self-contained logic: settings, membership resolution, completion detection.

pub mod completion;
pub mod membership;
pub mod settings_engine;
