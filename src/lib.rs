pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod jobs;
pub mod loaders;
pub mod model_id;
pub mod model_list;
pub mod renderer;
pub mod scene;
pub mod store;
pub mod upload;
pub mod viewer;

pub use app::{ModelViewerApp, UiAction};
pub use error::{ViewerError, ViewerResult};
pub use model_id::ModelId;
pub use scene::{SceneGraphRoot, SceneNode};
pub use viewer::ViewerState;
