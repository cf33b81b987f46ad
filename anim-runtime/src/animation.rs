//! # Animation 模块
//!
//! 单个属性动画实例（“片段”）。
//!
//! 核心设计：动画只关注一个 f32 槽位从 `from` 到 `to` 的时间轴变化，
//! 由调度器负责把值写回实体。

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::easing::EasingFunction;
use crate::property::{AnimProperty, Animatable};
use crate::scheduler::AnimationScheduler;

/// 完成判定的容差（秒）
///
/// 逐帧累加 `1/60` 这类间隔会有浮点误差，距终点不足此值视为已到终点。
pub const COMPLETION_EPSILON: f32 = 1e-4;

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// 创建新的动画 ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 动画事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    /// 动画入队
    Started(AnimationId),
    /// 动画到达终点并移出队列
    Completed(AnimationId),
    /// 动画被取消（不触发完成回调）
    Cancelled(AnimationId),
}

/// 动画分类标签
///
/// 例如 `"flip"`：其它逻辑只需问“是否有翻转动画在进行”，不必检查属性。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationTag(Cow<'static, str>);

impl AnimationTag {
    /// 从静态字符串创建（可用于常量）
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for AnimationTag {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

impl From<String> for AnimationTag {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

impl fmt::Display for AnimationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 完成回调
///
/// 在本帧所有写值完成、已完成动画移出队列之后调用，至多一次。
/// 回调可以向调度器追加新动画（串联下一段），新动画从下一次 `update` 开始推进。
pub type OnComplete<T> = Box<dyn FnOnce(&mut AnimationScheduler<T>, &T)>;

/// 属性动画实例
///
/// 管理单个槽位从 `from` 到 `to` 在 `duration` 秒内的变化。
pub struct Animation<T: Animatable> {
    /// 动画 ID（入队时分配）
    pub(crate) id: AnimationId,
    /// 目标槽位
    pub property: T::Property,
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 动画时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
    /// 延迟启动（秒），延迟期间不写值
    pub delay: f32,
    /// 分类标签
    pub tag: Option<AnimationTag>,
    /// 已消耗的延迟
    waited: f32,
    /// 延迟结束后经过的时间，只增不减
    elapsed: f32,
    /// 是否已越过延迟
    started: bool,
    /// 完成回调
    on_complete: Option<OnComplete<T>>,
}

impl<T: Animatable> Animation<T> {
    /// 创建新的动画
    ///
    /// 负时长按 0 处理：首次 `update` 即完成。
    pub fn new(property: T::Property, from: f32, to: f32, duration: f32) -> Self {
        if duration < 0.0 {
            warn!(
                property = property.name(),
                duration, "负的动画时长，按 0 处理"
            );
        }

        Self {
            id: AnimationId::default(),
            property,
            from,
            to,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            delay: 0.0,
            tag: None,
            waited: 0.0,
            elapsed: 0.0,
            started: false,
            on_complete: None,
        }
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// 设置分类标签
    pub fn with_tag(mut self, tag: impl Into<AnimationTag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// 设置完成回调
    pub fn on_complete(
        mut self,
        callback: impl FnOnce(&mut AnimationScheduler<T>, &T) + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// 延迟结束后经过的时间
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// 是否带有完成回调
    pub fn has_on_complete(&self) -> bool {
        self.on_complete.is_some()
    }

    /// 是否带有指定标签
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_ref().is_some_and(|t| t.as_str() == tag)
    }

    /// 时间进度（0.0 - 1.0，未应用缓动）
    pub fn progress(&self) -> f32 {
        if !self.started {
            return 0.0;
        }
        if self.elapsed >= self.duration - COMPLETION_EPSILON {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// 缓动后的进度（允许越界）
    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    /// 当前插值
    ///
    /// 到达终点时精确返回 `to`，不受缓动曲线末端误差影响。
    pub fn current_value(&self) -> f32 {
        if self.is_complete() {
            self.to
        } else {
            self.from + (self.to - self.from) * self.eased_progress()
        }
    }

    /// 是否已越过延迟、开始写值
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// 是否已到达终点
    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// 推进时间
    ///
    /// # 返回
    /// 需要写入槽位的值；延迟期间返回 `None`
    pub(crate) fn advance(&mut self, dt: f32) -> Option<f32> {
        if self.started {
            self.elapsed += dt;
        } else {
            self.waited += dt;
            if self.waited < self.delay {
                return None;
            }
            // 越过延迟的部分计入本帧
            self.started = true;
            self.elapsed = self.waited - self.delay;
        }
        Some(self.current_value())
    }

    /// 直接跳到终点
    pub(crate) fn finish(&mut self) {
        self.started = true;
        self.waited = self.waited.max(self.delay);
        self.elapsed = self.elapsed.max(self.duration);
    }

    pub(crate) fn take_on_complete(&mut self) -> Option<OnComplete<T>> {
        self.on_complete.take()
    }
}

impl<T: Animatable> fmt::Debug for Animation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("property", &self.property)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("easing", &self.easing)
            .field("delay", &self.delay)
            .field("tag", &self.tag)
            .field("waited", &self.waited)
            .field("elapsed", &self.elapsed)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}
