use std::path::PathBuf;

use crate::compose::WireConfig;
use crate::item::ItemId;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the processing service on one file. At most one is outstanding.
    ProcessItem {
        item_id: ItemId,
        input_path: PathBuf,
        config: WireConfig,
    },
    /// Fire-and-forget: show the folder holding `path`.
    RevealOutput { path: PathBuf },
}
