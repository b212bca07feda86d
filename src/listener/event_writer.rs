use log::warn;
use serde_json::{json, Value};

use super::Listener;
use crate::model::*;
use crate::util::misc::write_to_file;

// [EventWriter]
// 1局分のイベントをjsonの配列として記録
// file_pathを指定した場合は局終了時に書き出す
#[derive(Debug, Default)]
pub struct EventWriter {
    file_path: Option<String>,
    record: Vec<Value>,
}

impl EventWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(file_path: &str) -> Self {
        Self {
            file_path: Some(file_path.to_string()),
            record: vec![],
        }
    }

    pub fn record(&self) -> &[Value] {
        &self.record
    }
}

impl Listener for EventWriter {
    fn notify_event(&mut self, _stg: &Stage, event: &Event) {
        if let Event::New(_) = event {
            self.record.clear();
        }
        self.record.push(json!(event));

        if let (Event::Win(_) | Event::Draw(_), Some(path)) = (event, &self.file_path) {
            let data = match serde_json::to_string_pretty(&self.record) {
                Ok(d) => d,
                Err(e) => {
                    warn!("failed to serialize record: {}", e);
                    return;
                }
            };
            if let Err(e) = write_to_file(path, &data) {
                warn!("failed to write {}: {}", path, e);
            }
        }
    }
}
