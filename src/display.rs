use std::collections::HashMap;
use log::debug;

/// 分组显示顺序，覆盖全部读数字段
const GROUPS: [(&str, &[&str]); 5] = [
    ("Temperature", &["temp"]),
    ("Gyroscope", &["gyroX", "gyroY", "gyroZ"]),
    ("Accelerometer", &["acclX", "acclY", "acclZ"]),
    ("Magnetometer", &["magnX", "magnY", "magnZ"]),
    ("Orientation", &["tiltY", "tiltR", "tiltP", "tiltYaw", "tiltRoll", "tiltPitch"]),
];

/// 读数文本槽位
///
/// 只有注册过的 id 可以写入，写入未注册的 id 会被忽略。
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    slots: HashMap<String, Option<String>>,
}

impl DisplayBoard {
    pub fn new(slot_ids: &[String]) -> Self {
        let slots = slot_ids.iter().map(|id| (id.clone(), None)).collect();
        Self { slots }
    }

    /// 写入文本；槽位不存在时返回 false
    pub fn set_text(&mut self, id: &str, text: String) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                *slot = Some(text);
                true
            }
            None => {
                debug!("No display slot for '{}'", id);
                false
            }
        }
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.slots.get(id).and_then(|slot| slot.as_deref())
    }

    /// 已写入过内容的槽位数
    pub fn filled(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_some()).count()
    }

    /// 按分组列出已写入的槽位
    pub fn grouped(&self) -> Vec<(&'static str, Vec<(&str, &str)>)> {
        GROUPS
            .iter()
            .map(|(title, ids)| {
                let entries: Vec<(&str, &str)> = ids
                    .iter()
                    .filter_map(|id| self.slots.get_key_value(*id))
                    .filter_map(|(id, text)| text.as_deref().map(|t| (id.as_str(), t)))
                    .collect();
                (*title, entries)
            })
            .filter(|(_, entries)| !entries.is_empty())
            .collect()
    }

    pub fn ui(&self, ui: &mut egui::Ui) {
        let groups = self.grouped();
        if groups.is_empty() {
            ui.label("waiting for readings...");
            return;
        }

        for (title, entries) in groups {
            ui.group(|ui| {
                ui.strong(title);
                egui::Grid::new(title)
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (id, text) in entries {
                            ui.label(id);
                            ui.monospace(text);
                            ui.end_row();
                        }
                    });
            });
            ui.add_space(4.0);
        }
    }
}
