//! # Anim Runtime
//!
//! 逐实体的属性动画调度器。
//!
//! ## 架构概述
//!
//! `anim-runtime` 是纯逻辑核心，不依赖渲染引擎。
//! 每个可动画实体拥有一个调度器，由宿主的渲染循环每帧驱动一次：
//!
//! ```text
//! Render loop                    Entity
//!   │                              │
//!   │──── update(dt) ────────────►│ 推进动画、写槽位、触发回调
//!   │◄─── state() ────────────────│ 读取当前值并绘制
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`AnimationScheduler`]：一个实体的动画队列
//! - [`Animation`]：单个属性动画（片段）
//! - [`EasingFunction`]：缓动函数
//! - [`Animatable`] / [`AnimProperty`]：实体与槽位接口
//! - [`AnimatedEntity`]：状态 + 调度器
//! - [`Choreography`]：JSON 描述的多段编排
//!
//! ## 使用示例
//!
//! ```ignore
//! use anim_runtime::{AnimatedEntity, EasingFunction, Transform, TransformProperty};
//!
//! let mut card = AnimatedEntity::new(Transform::with_opacity(0.0));
//! card.animate(TransformProperty::Opacity, 0.0, 1.0, 0.5, EasingFunction::Linear);
//!
//! loop {
//!     card.update(dt);
//!     draw(card.state());
//! }
//! ```

pub mod animation;
pub mod choreography;
pub mod easing;
pub mod entity;
pub mod error;
pub mod property;
pub mod scheduler;
pub mod transform;

// 重导出核心类型
pub use animation::{
    Animation, AnimationEvent, AnimationId, AnimationTag, COMPLETION_EPSILON, OnComplete,
};
pub use choreography::{Choreography, ChoreographySpec, Leg, LegSpec};
pub use easing::EasingFunction;
pub use entity::AnimatedEntity;
pub use error::{AnimError, AnimResult};
pub use property::{AnimProperty, Animatable};
pub use scheduler::AnimationScheduler;
pub use transform::{Transform, TransformProperty, Vec3};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let mut card = AnimatedEntity::new(Transform::identity());
        let id = card.animate(
            TransformProperty::Scale,
            1.0,
            2.0,
            1.0,
            EasingFunction::EaseInOut,
        );
        assert_eq!(id, AnimationId(1));

        let _ = Choreography::<TransformProperty>::from_json(r#"{ "legs": [] }"#);
    }
}
