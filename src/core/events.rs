use bevy::prelude::*;

/// 给玩家看的一句话，由 main 里的 forward_log_event 打印
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);
