//! # Scheduler 模块
//!
//! 逐实体的动画调度器。
//!
//! 每个实体拥有一个调度器实例，由外部渲染循环每帧调用一次 `update`：
//! ```rust,ignore
//! let mut scheduler = AnimationScheduler::<Transform>::new();
//! scheduler.animate(TransformProperty::Opacity, 0.0, 1.0, 0.5, EasingFunction::Linear);
//! scheduler.update(&mut transform, dt);
//! ```
//!
//! ## 更新顺序
//!
//! 1. 对调用开始时队列中的每个动画推进时间并写值（按队列顺序）
//! 2. 移除所有已完成的动画
//! 3. 按处理顺序调用它们的完成回调
//!
//! 回调在移除之后才执行，因此回调中追加的动画不会在同一次 `update` 中被推进。
//!
//! ## 同属性冲突
//!
//! 两个动画指向同一槽位时都会写值，队列靠后的覆盖靠前的。
//! 需要替换时先 `cancel_property`，或直接用 `animate_replacing`。

use std::fmt;

use tracing::debug;

use crate::animation::{Animation, AnimationEvent, AnimationId, OnComplete};
use crate::easing::EasingFunction;
use crate::property::{AnimProperty, Animatable};

/// 动画调度器
///
/// 持有一个实体的全部进行中动画（插入顺序即到达顺序）。
/// 各动画相互独立推进，顺序只决定同槽位写值的先后。
pub struct AnimationScheduler<T: Animatable> {
    /// 进行中的动画
    queue: Vec<Animation<T>>,
    /// 下一个动画 ID
    next_anim_id: u64,
    /// 是否暂停
    paused: bool,
    /// 待取出的事件
    events: Vec<AnimationEvent>,
}

impl<T: Animatable> Default for AnimationScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Animatable> fmt::Debug for AnimationScheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("animations", &self.queue.len())
            .field("paused", &self.paused)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<T: Animatable> AnimationScheduler<T> {
    /// 创建空的调度器
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            next_anim_id: 1,
            paused: false,
            events: Vec::new(),
        }
    }

    /// 生成下一个动画 ID
    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_anim_id);
        self.next_anim_id += 1;
        id
    }

    // ========== 入队 ==========

    /// 追加动画
    ///
    /// 总是成功。`from` 由调用方选择，应与当前值一致以免跳变。
    pub fn enqueue(&mut self, mut animation: Animation<T>) -> AnimationId {
        let id = self.next_animation_id();
        animation.id = id;

        debug!(
            id = id.0,
            property = animation.property.name(),
            from = animation.from,
            to = animation.to,
            duration = animation.duration,
            easing = animation.easing.name(),
            tag = animation.tag.as_ref().map(|t| t.as_str()),
            "enqueue animation"
        );

        self.queue.push(animation);
        self.events.push(AnimationEvent::Started(id));
        id
    }

    /// 追加一个不带回调的属性动画
    pub fn animate(
        &mut self,
        property: T::Property,
        from: f32,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> AnimationId {
        self.enqueue(Animation::new(property, from, to, duration).with_easing(easing))
    }

    /// 先取消同一槽位的现有动画，再追加新动画
    pub fn animate_replacing(
        &mut self,
        property: T::Property,
        from: f32,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> AnimationId {
        self.cancel_property(property);
        self.animate(property, from, to, duration, easing)
    }

    // ========== 推进 ==========

    /// 推进一帧
    ///
    /// `dt` 为负或 NaN 时按 0 处理，`elapsed` 只增不减。
    ///
    /// # 返回
    /// 自上次取出以来产生的事件（含本帧回调中的入队），事件队列随之清空
    pub fn update(&mut self, target: &mut T, dt: f32) -> Vec<AnimationEvent> {
        if self.paused || self.queue.is_empty() {
            return self.drain_events();
        }
        let dt = dt.max(0.0);

        let mut any_complete = false;
        for animation in &mut self.queue {
            if let Some(value) = animation.advance(dt) {
                target.set_value(animation.property, value);
            }
            any_complete |= animation.is_complete();
        }

        if any_complete {
            let callbacks = self.remove_completed();
            self.run_callbacks(callbacks, target);
        }

        self.drain_events()
    }

    /// 把队列中所有动画直接推到终点
    ///
    /// 写入各自的 `to` 并按队列顺序调用回调。
    /// 回调追加的后续片段保留在队列中，等待下一次 `update`。
    pub fn finish_all(&mut self, target: &mut T) {
        for animation in &mut self.queue {
            animation.finish();
            target.set_value(animation.property, animation.to);
        }

        let callbacks = self.remove_completed();
        self.run_callbacks(callbacks, target);
    }

    /// 移除已完成的动画，按处理顺序收集回调
    fn remove_completed(&mut self) -> Vec<OnComplete<T>> {
        let (completed, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|a| a.is_complete());
        self.queue = pending;

        let mut callbacks = Vec::new();
        for mut animation in completed {
            debug!(
                id = animation.id.0,
                property = animation.property.name(),
                "animation completed"
            );
            self.events.push(AnimationEvent::Completed(animation.id));
            if let Some(callback) = animation.take_on_complete() {
                callbacks.push(callback);
            }
        }
        callbacks
    }

    fn run_callbacks(&mut self, callbacks: Vec<OnComplete<T>>, target: &T) {
        for callback in callbacks {
            callback(self, target);
        }
    }

    // ========== 取消 ==========

    /// 丢弃满足条件的动画
    ///
    /// 被取消的动画不写终值，也不调用完成回调。
    ///
    /// # 返回
    /// 取消的数量
    pub fn cancel(&mut self, mut predicate: impl FnMut(&Animation<T>) -> bool) -> usize {
        let before = self.queue.len();
        let events = &mut self.events;
        self.queue.retain(|animation| {
            if predicate(animation) {
                debug!(
                    id = animation.id.0,
                    property = animation.property.name(),
                    "animation cancelled"
                );
                events.push(AnimationEvent::Cancelled(animation.id));
                false
            } else {
                true
            }
        });
        before - self.queue.len()
    }

    /// 取消指定槽位的全部动画
    pub fn cancel_property(&mut self, property: T::Property) -> usize {
        self.cancel(|a| a.property == property)
    }

    /// 取消指定 ID 的动画
    pub fn cancel_id(&mut self, id: AnimationId) -> bool {
        self.cancel(|a| a.id == id) > 0
    }

    /// 丢弃全部动画与未取出的事件（不调用回调）
    pub fn clear(&mut self) {
        self.queue.clear();
        self.events.clear();
    }

    // ========== 暂停 ==========

    /// 暂停：之后的 `update` 不推进任何动画
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// 恢复推进
    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ========== 查询方法 ==========

    /// 是否有带指定标签的动画在队列中
    pub fn has_tag(&self, tag: &str) -> bool {
        self.queue.iter().any(|a| a.has_tag(tag))
    }

    /// 是否有指向指定槽位的动画在队列中
    pub fn has_property(&self, property: T::Property) -> bool {
        self.queue.iter().any(|a| a.property == property)
    }

    /// 队列长度
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// 是否有动画在进行
    pub fn is_animating(&self) -> bool {
        !self.queue.is_empty()
    }

    /// 按队列顺序遍历动画
    pub fn iter(&self) -> impl Iterator<Item = &Animation<T>> {
        self.queue.iter()
    }

    /// 查询动画
    pub fn get(&self, id: AnimationId) -> Option<&Animation<T>> {
        self.queue.iter().find(|a| a.id == id)
    }

    /// 查询动画的时间进度（0.0 - 1.0）
    pub fn progress(&self, id: AnimationId) -> Option<f32> {
        self.get(id).map(|a| a.progress())
    }

    /// 取出并清空事件队列
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }
}
