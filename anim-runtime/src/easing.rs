//! # Easing 模块
//!
//! 缓动函数库，把归一化的时间进度映射为缓动后的进度。
//!
//! 输入会被限制在 `[0, 1]`，输出不做限制：`EaseOutBack` 这类曲线
//! 会越过终点再回落（用于回弹效果）。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// `Back` 系列曲线的过冲系数
const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// 缓动函数类型
///
/// 命名曲线可以按 snake_case 名称序列化（编排文件使用）；
/// `Custom` 携带调用方提供的纯函数，不参与序列化。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 缓入（先慢后快）
    EaseIn,
    /// 缓出（先快后慢）
    EaseOut,
    /// 缓入缓出（两头慢中间快）
    EaseInOut,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    EaseOutCubic,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 正弦缓入
    EaseInSine,
    /// 正弦缓出
    EaseOutSine,
    /// 正弦缓入缓出
    EaseInOutSine,
    /// 弹性缓出
    EaseOutElastic,
    /// 弹跳缓出
    EaseOutBounce,
    /// 回拉缓入（起步先向反方向走一点）
    EaseInBack,
    /// 过冲缓出（越过终点再回落）
    EaseOutBack,
    /// 自定义曲线
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl PartialEq for EasingFunction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Custom(a), Self::Custom(b)) => std::ptr::fn_addr_eq(*a, *b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Eq for EasingFunction {}

impl EasingFunction {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度，超出 `[0, 1]` 的部分会被截断
    ///
    /// # 返回
    /// - 缓动后的进度，允许越界（过冲）
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseIn | EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOut | EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOut | EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingFunction::EaseOutSine => (t * PI / 2.0).sin(),
            EasingFunction::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EasingFunction::EaseOutElastic => ease_out_elastic(t),
            EasingFunction::EaseOutBounce => ease_out_bounce(t),
            EasingFunction::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            EasingFunction::EaseOutBack => {
                let u = t - 1.0;
                1.0 + BACK_C3 * u * u * u + BACK_C1 * u * u
            }
            EasingFunction::Custom(f) => f(t),
        }
    }

    /// 曲线名称（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            EasingFunction::Linear => "linear",
            EasingFunction::EaseIn => "ease_in",
            EasingFunction::EaseOut => "ease_out",
            EasingFunction::EaseInOut => "ease_in_out",
            EasingFunction::EaseInQuad => "ease_in_quad",
            EasingFunction::EaseOutQuad => "ease_out_quad",
            EasingFunction::EaseInOutQuad => "ease_in_out_quad",
            EasingFunction::EaseInCubic => "ease_in_cubic",
            EasingFunction::EaseOutCubic => "ease_out_cubic",
            EasingFunction::EaseInOutCubic => "ease_in_out_cubic",
            EasingFunction::EaseInSine => "ease_in_sine",
            EasingFunction::EaseOutSine => "ease_out_sine",
            EasingFunction::EaseInOutSine => "ease_in_out_sine",
            EasingFunction::EaseOutElastic => "ease_out_elastic",
            EasingFunction::EaseOutBounce => "ease_out_bounce",
            EasingFunction::EaseInBack => "ease_in_back",
            EasingFunction::EaseOutBack => "ease_out_back",
            EasingFunction::Custom(_) => "custom",
        }
    }
}

/// 弹性缓出
fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

/// 弹跳缓出
fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_out() {
        let easing = EasingFunction::EaseInOut;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
        let mid = easing.apply(0.5);
        assert!((mid - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_clamp_input() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_cubic_endpoints() {
        assert_eq!(EasingFunction::EaseOutCubic.apply(1.0), 1.0);
        assert_eq!(EasingFunction::EaseInCubic.apply(0.5), 0.125);
        assert_eq!(EasingFunction::EaseOutCubic.apply(0.5), 0.875);
    }

    #[test]
    fn test_ease_out_bounce() {
        let easing = EasingFunction::EaseOutBounce;
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ease_out_back_overshoots() {
        let easing = EasingFunction::EaseOutBack;
        // 中段越过终点
        assert!(easing.apply(0.7) > 1.0);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        assert!(EasingFunction::EaseInBack.apply(0.2) < 0.0);
    }

    #[test]
    fn test_custom() {
        fn square(t: f32) -> f32 {
            t * t
        }
        let easing = EasingFunction::Custom(square);
        assert_eq!(easing.apply(0.5), 0.25);
        assert_eq!(easing, EasingFunction::Custom(square));
        assert_ne!(easing, EasingFunction::Linear);
        assert_eq!(easing.name(), "custom");
    }

    #[test]
    fn test_serde_name() {
        let easing: EasingFunction = serde_json::from_str("\"ease_out_cubic\"").unwrap();
        assert_eq!(easing, EasingFunction::EaseOutCubic);
        assert_eq!(
            serde_json::to_string(&EasingFunction::EaseInOutSine).unwrap(),
            "\"ease_in_out_sine\""
        );
        assert!(serde_json::from_str::<EasingFunction>("\"wobble\"").is_err());
    }
}
