//! # Choreography 模块
//!
//! 编排：用 JSON 描述一个实体的多段动作。
//!
//! ```json
//! {
//!   "name": "ticket-drop",
//!   "legs": [
//!     { "property": "positionZ", "from": 3.0, "to": 0.0, "duration": 0.5,
//!       "easing": "ease_out_cubic",
//!       "then": [ { "property": "positionZ", "to": 0.3, "duration": 0.15 } ] },
//!     { "property": "opacity", "from": 0.0, "to": 1.0, "duration": 0.4 }
//!   ]
//! }
//! ```
//!
//! - 省略 `from` 时使用片段入队那一刻的槽位当前值
//! - `then` 中的片段在父片段的完成回调里入队

use serde::{Deserialize, Serialize};

use crate::animation::{Animation, AnimationId, AnimationTag};
use crate::easing::EasingFunction;
use crate::error::{AnimError, AnimResult};
use crate::property::{AnimProperty, Animatable};
use crate::scheduler::AnimationScheduler;

/// 片段的原始描述（文件格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegSpec {
    /// 属性名（`positionZ` / `position_z`）
    pub property: String,
    /// 起始值，省略时取当前值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f32>,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    #[serde(default)]
    pub easing: EasingFunction,
    /// 延迟（秒）
    #[serde(default)]
    pub delay: f32,
    /// 分类标签
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// 完成后串联的片段
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<LegSpec>,
}

/// 编排的原始描述（文件格式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoreographySpec {
    #[serde(default)]
    pub name: String,
    pub legs: Vec<LegSpec>,
}

/// 校验后的片段
#[derive(Debug, Clone, PartialEq)]
pub struct Leg<P> {
    pub property: P,
    pub from: Option<f32>,
    pub to: f32,
    pub duration: f32,
    pub easing: EasingFunction,
    pub delay: f32,
    pub tag: Option<AnimationTag>,
    pub then: Vec<Leg<P>>,
}

/// 校验后的编排
#[derive(Debug, Clone, PartialEq)]
pub struct Choreography<P> {
    pub name: String,
    pub legs: Vec<Leg<P>>,
}

impl<P: AnimProperty> Choreography<P> {
    /// 从 JSON 文本解析并校验
    pub fn from_json(json: &str) -> AnimResult<Self> {
        let spec: ChoreographySpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// 校验原始描述
    ///
    /// 片段按深度优先顺序编号（从 0 开始），错误信息中的序号即此编号。
    pub fn from_spec(spec: ChoreographySpec) -> AnimResult<Self> {
        let mut index = 0;
        let legs = resolve_legs(spec.legs, &mut index)?;
        Ok(Self {
            name: spec.name,
            legs,
        })
    }

    /// 片段总数（含串联片段）
    pub fn leg_count(&self) -> usize {
        fn count<P>(legs: &[Leg<P>]) -> usize {
            legs.iter().map(|leg| 1 + count(&leg.then)).sum()
        }
        count(&self.legs)
    }

    /// 把顶层片段加入调度器
    ///
    /// # 返回
    /// 顶层片段的动画 ID
    pub fn schedule<T>(&self, scheduler: &mut AnimationScheduler<T>, target: &T) -> Vec<AnimationId>
    where
        T: Animatable<Property = P>,
    {
        self.legs
            .iter()
            .map(|leg| schedule_leg(leg.clone(), scheduler, target))
            .collect()
    }
}

fn resolve_legs<P: AnimProperty>(specs: Vec<LegSpec>, index: &mut usize) -> AnimResult<Vec<Leg<P>>> {
    specs
        .into_iter()
        .map(|spec| resolve_leg(spec, index))
        .collect()
}

fn resolve_leg<P: AnimProperty>(spec: LegSpec, index: &mut usize) -> AnimResult<Leg<P>> {
    let current = *index;
    *index += 1;

    let property = P::from_name(&spec.property)?;
    if !spec.duration.is_finite() || spec.duration < 0.0 {
        return Err(AnimError::InvalidLeg {
            index: current,
            message: format!("时长必须是非负数，实际为 {}", spec.duration),
        });
    }
    if !spec.delay.is_finite() || spec.delay < 0.0 {
        return Err(AnimError::InvalidLeg {
            index: current,
            message: format!("延迟必须是非负数，实际为 {}", spec.delay),
        });
    }

    let then = resolve_legs(spec.then, index)?;
    Ok(Leg {
        property,
        from: spec.from,
        to: spec.to,
        duration: spec.duration,
        easing: spec.easing,
        delay: spec.delay,
        tag: spec.tag.map(AnimationTag::from),
        then,
    })
}

fn schedule_leg<T: Animatable>(
    leg: Leg<T::Property>,
    scheduler: &mut AnimationScheduler<T>,
    target: &T,
) -> AnimationId {
    let from = leg.from.unwrap_or_else(|| target.value(leg.property));
    let mut animation = Animation::<T>::new(leg.property, from, leg.to, leg.duration)
        .with_easing(leg.easing)
        .with_delay(leg.delay);
    if let Some(tag) = leg.tag {
        animation = animation.with_tag(tag);
    }

    if !leg.then.is_empty() {
        let next = leg.then;
        animation = animation.on_complete(move |scheduler, target| {
            for leg in next {
                schedule_leg(leg, scheduler, target);
            }
        });
    }

    scheduler.enqueue(animation)
}
