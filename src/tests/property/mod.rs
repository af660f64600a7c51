//! Property-based tests for the panel core.
//!
//! - `filter_props`: voice filtering and catalog reload
//!   - Filtered voices are an ordered subset of the catalog
//!   - Every filtered voice has the selected language
//!   - Male and female results are subsets of the unfiltered result
//!   - Reloading the same voices twice changes nothing
//!
//! - `playback_props`: the playback state machine
//!   - Any sequence of controls followed by stop ends idle
//!   - Utterance ids only grow
//!   - Only the active utterance can end playback
//!
//! Case count follows `PROPTEST_CASES` (default 256).

mod filter_props;
mod playback_props;
