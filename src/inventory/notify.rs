//! 通知分发：三类事件，各自一串监听者，按注册顺序同步调用

use bevy::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::events::{InventoryLoaded, ItemChanged, SlotChanged};
use crate::data::schema::{ItemCategory, ItemSlot};

/// 注册时返回，用于注销
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// 有序的回调列表
pub struct Listeners<E> {
    entries: Vec<(ListenerId, Callback<E>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<E> Listeners<E> {
    fn push(&mut self, id: ListenerId, callback: Callback<E>) {
        self.entries.push((id, callback));
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    fn broadcast(&mut self, event: &E) {
        for (_, callback) in &mut self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 背包的三路通知
#[derive(Debug, Default)]
pub struct InventoryNotifier {
    next_id: u64,
    item_changed: Listeners<ItemChanged>,
    slot_changed: Listeners<SlotChanged>,
    loaded: Listeners<InventoryLoaded>,
}

impl InventoryNotifier {
    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub fn on_item_changed(
        &mut self,
        callback: impl FnMut(&ItemChanged) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.item_changed.push(id, Box::new(callback));
        id
    }

    pub fn on_slot_changed(
        &mut self,
        callback: impl FnMut(&SlotChanged) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.slot_changed.push(id, Box::new(callback));
        id
    }

    pub fn on_inventory_loaded(
        &mut self,
        callback: impl FnMut(&InventoryLoaded) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.allocate();
        self.loaded.push(id, Box::new(callback));
        id
    }

    /// 不论注册在哪一路都能注销
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.item_changed.remove(id) || self.slot_changed.remove(id) || self.loaded.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.item_changed.len() + self.slot_changed.len() + self.loaded.len()
    }

    pub fn notify_item_changed(&mut self, added: bool, key: &str, category: ItemCategory) {
        self.item_changed.broadcast(&ItemChanged {
            added,
            key: key.to_string(),
            category,
        });
    }

    /// 通知里的大类取槽位自己的
    pub fn notify_slot_changed(&mut self, slot: ItemSlot, key: &str) {
        self.slot_changed.broadcast(&SlotChanged {
            slot,
            key: key.to_string(),
            category: slot.category,
        });
    }

    pub fn notify_loaded(&mut self) {
        self.loaded.broadcast(&InventoryLoaded);
    }
}

/* ---------------------------- 转发到 Bevy 事件 ---------------------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryNotice {
    ItemChanged(ItemChanged),
    SlotChanged(SlotChanged),
    Loaded,
}

/// 监听者把通知塞进队列，每帧由 forward_notifications 转成 Bevy 事件
#[derive(Resource, Clone, Default)]
pub struct NotificationQueue(Arc<Mutex<VecDeque<InventoryNotice>>>);

impl NotificationQueue {
    fn push(&self, notice: InventoryNotice) {
        match self.0.lock() {
            Ok(mut queue) => queue.push_back(notice),
            Err(_) => warn!("通知队列锁已损坏，丢弃 {notice:?}"),
        }
    }

    /// 在背包上挂三个转发监听者
    pub fn attach(&self, notifier: &mut InventoryNotifier) -> [ListenerId; 3] {
        let items = self.clone();
        let slots = self.clone();
        let loaded = self.clone();
        [
            notifier.on_item_changed(move |e| items.push(InventoryNotice::ItemChanged(e.clone()))),
            notifier.on_slot_changed(move |e| slots.push(InventoryNotice::SlotChanged(e.clone()))),
            notifier.on_inventory_loaded(move |_| loaded.push(InventoryNotice::Loaded)),
        ]
    }

    pub fn drain(&self) -> Vec<InventoryNotice> {
        match self.0.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => {
                warn!("通知队列锁已损坏，本帧不转发");
                Vec::new()
            }
        }
    }
}
