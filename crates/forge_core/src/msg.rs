use std::path::PathBuf;

use crate::config::{ConfigPatch, JpegOptions, PngOptions, ResizePatch, WebPOptions};
use crate::item::{FileInfo, ItemId, ProcessResult};
use crate::projection::StatusFilter;
use crate::state::PersistedSession;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Scanner or picker produced files to queue.
    FilesAdded(Vec<FileInfo>),
    /// User removed one item from the queue.
    ItemRemoved(ItemId),
    /// User cleared the whole queue.
    QueueCleared,
    SelectionToggled(ItemId),
    SelectAll,
    DeselectAll,
    FilterChanged(StatusFilter),
    /// Root folder used to mirror the input tree in the output directory.
    BasePathChanged(Option<PathBuf>),
    ConfigUpdated(ConfigPatch),
    ResizeUpdated(ResizePatch),
    PngOptionsChanged(PngOptions),
    JpegOptionsChanged(JpegOptions),
    WebpOptionsChanged(WebPOptions),
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop.
    StopClicked,
    /// Engine progress for the in-flight item.
    ItemProgress { item_id: ItemId, percent: u8 },
    /// Engine finished the in-flight item. `Err` carries the failure text.
    ItemProcessed {
        item_id: ItemId,
        outcome: Result<ProcessResult, String>,
    },
    /// Open (Some) or close (None) the preview panel.
    PreviewRequested(Option<ItemId>),
    /// Preview bytes could not be produced; diagnostic only.
    PreviewFailed { item_id: ItemId, message: String },
    LogsVisibilityChanged(bool),
    LogsCleared,
    /// User asked to open the folder containing an item's output.
    RevealOutputClicked(ItemId),
    /// Restore a previously saved session.
    RestoreSession(PersistedSession),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
