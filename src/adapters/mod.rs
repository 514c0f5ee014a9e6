//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements      | Connects to               |
//! |-------------|-----------------|---------------------------|
//! | `log_sink`  | EventSink       | `log` facade              |
//! | `simulated` | DevicePort      | In-process hopper model   |
//! |             | DispenserPort   |                           |
//! | `store`     | SettingsPort    | In-memory key/value store |
//! |             | StoragePort     |                           |
//! | `time`      | ClockPort       | System clock + chrono-tz  |

pub mod log_sink;
pub mod simulated;
pub mod store;
pub mod time;
