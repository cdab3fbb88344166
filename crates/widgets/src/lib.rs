pub mod error;
pub mod model;
pub mod query;
pub mod store;
pub mod view;

pub use error::{ConfigError, InvalidSelection, SideChannelError};
pub use model::{QueryParamMode, RenderPolicy, TabDescriptor, TabGroupConfig, TabGroupModel};
pub use query::{BrowserQuery, MemoryQuery, QuerySync};
pub use store::{storage_key, LocalStorage, MemoryStore, SelectionStore};
pub use view::{TabGroup, TabPane};
