//! # Entity 模块
//!
//! 可动画实体：当前值槽位 + 专属调度器。
//!
//! 槽位只会被调度器的 `update` 或外部的 `reset` 修改。

use crate::animation::{Animation, AnimationEvent, AnimationId};
use crate::easing::EasingFunction;
use crate::property::Animatable;
use crate::scheduler::AnimationScheduler;

/// 带调度器的可动画实体
///
/// ## 使用示例
///
/// ```rust,ignore
/// let mut card = AnimatedEntity::new(Transform::with_opacity(0.0));
/// card.animate(TransformProperty::Opacity, 0.0, 1.0, 0.5, EasingFunction::Linear);
///
/// // 渲染循环
/// card.update(dt);
/// draw(card.state());
/// ```
#[derive(Debug)]
pub struct AnimatedEntity<T: Animatable> {
    state: T,
    scheduler: AnimationScheduler<T>,
}

impl<T: Animatable + Default> Default for AnimatedEntity<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Animatable> AnimatedEntity<T> {
    /// 以初始状态创建实体
    pub fn new(state: T) -> Self {
        Self {
            state,
            scheduler: AnimationScheduler::new(),
        }
    }

    /// 当前状态（渲染读取）
    pub fn state(&self) -> &T {
        &self.state
    }

    /// 读取单个槽位
    pub fn value(&self, property: T::Property) -> f32 {
        self.state.value(property)
    }

    pub fn scheduler(&self) -> &AnimationScheduler<T> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler<T> {
        &mut self.scheduler
    }

    /// 推进一帧，返回本帧取出的事件
    pub fn update(&mut self, dt: f32) -> Vec<AnimationEvent> {
        self.scheduler.update(&mut self.state, dt)
    }

    /// 追加动画
    pub fn enqueue(&mut self, animation: Animation<T>) -> AnimationId {
        self.scheduler.enqueue(animation)
    }

    /// 追加属性动画
    pub fn animate(
        &mut self,
        property: T::Property,
        from: f32,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> AnimationId {
        self.scheduler.animate(property, from, to, duration, easing)
    }

    /// 从槽位当前值出发追加动画，避免跳变
    pub fn animate_from_current(
        &mut self,
        property: T::Property,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> AnimationId {
        let from = self.state.value(property);
        self.scheduler.animate(property, from, to, duration, easing)
    }

    /// 取消同槽位动画后从当前值出发追加动画
    pub fn animate_replacing(
        &mut self,
        property: T::Property,
        to: f32,
        duration: f32,
        easing: EasingFunction,
    ) -> AnimationId {
        let from = self.state.value(property);
        self.scheduler
            .animate_replacing(property, from, to, duration, easing)
    }

    /// 丢弃满足条件的动画
    pub fn cancel(&mut self, predicate: impl FnMut(&Animation<T>) -> bool) -> usize {
        self.scheduler.cancel(predicate)
    }

    /// 是否有带指定标签的动画在进行
    pub fn has_tag(&self, tag: &str) -> bool {
        self.scheduler.has_tag(tag)
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    /// 所有动画直接推到终点
    pub fn finish_all(&mut self) {
        self.scheduler.finish_all(&mut self.state);
    }

    /// 外部重置：清空队列（不调用回调）并替换状态
    pub fn reset(&mut self, state: T) {
        self.scheduler.clear();
        self.state = state;
    }

    /// 取出内部状态
    pub fn into_state(self) -> T {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Transform, TransformProperty};

    #[test]
    fn test_entity_update() {
        let mut card = AnimatedEntity::new(Transform::with_opacity(0.0));
        card.animate(
            TransformProperty::Opacity,
            0.0,
            1.0,
            0.5,
            EasingFunction::Linear,
        );

        card.update(0.25);
        assert_eq!(card.state().opacity, 0.5);
        assert!(card.is_animating());

        let events = card.update(0.25);
        assert_eq!(card.value(TransformProperty::Opacity), 1.0);
        assert!(!card.is_animating());
        assert_eq!(events, vec![AnimationEvent::Completed(AnimationId(1))]);
    }

    #[test]
    fn test_animate_from_current() {
        let mut card = AnimatedEntity::new(Transform::with_position(0.0, 0.0, 3.0));
        card.animate_from_current(TransformProperty::PositionZ, 1.0, 1.0, EasingFunction::Linear);

        let leg = card.scheduler().iter().next().unwrap();
        assert_eq!(leg.from, 3.0);

        card.update(0.5);
        assert_eq!(card.state().position.z, 2.0);
    }

    #[test]
    fn test_animate_replacing_keeps_other_properties() {
        let mut card = AnimatedEntity::<Transform>::default();
        card.animate(TransformProperty::RotationX, 0.0, 1.0, 1.0, EasingFunction::Linear);
        card.animate(TransformProperty::Scale, 1.0, 2.0, 1.0, EasingFunction::Linear);
        card.update(0.5);

        card.animate_replacing(TransformProperty::RotationX, 0.0, 0.5, EasingFunction::Linear);
        assert_eq!(card.scheduler().len(), 2);
        assert_eq!(card.scheduler().iter().last().unwrap().from, 0.5);
    }

    #[test]
    fn test_reset() {
        let mut card = AnimatedEntity::<Transform>::default();
        card.animate(TransformProperty::Scale, 1.0, 2.0, 1.0, EasingFunction::Linear);
        card.update(0.5);

        card.reset(Transform::with_opacity(0.25));
        assert!(!card.is_animating());
        card.update(1.0);
        assert_eq!(card.state().scale, 1.0);
        assert_eq!(card.state().opacity, 0.25);
    }

    #[test]
    fn test_finish_all() {
        let mut card = AnimatedEntity::<Transform>::default();
        card.animate(TransformProperty::PositionY, 0.0, -2.0, 4.0, EasingFunction::EaseInCubic);
        card.finish_all();
        assert_eq!(card.into_state().position.y, -2.0);
    }
}
