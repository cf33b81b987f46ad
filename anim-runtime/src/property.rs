//! # Property 模块
//!
//! 可动画实体的核心接口定义。
//!
//! ## 核心概念
//!
//! - `AnimProperty`: 实体可动画槽位的封闭枚举（编译期穷尽）
//! - `Animatable`: 可动画实体接口（按槽位读写当前值）
//!
//! 调度器只通过 `Animatable` 写值，不假设实体类型。
//! 槽位是封闭枚举，写入未声明的槽位在编译期就被拒绝；
//! 运行时的 `InvalidPropertyKind` 只出现在按名称解析时。

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{AnimError, AnimResult};

/// 可动画属性（槽位）
///
/// ## 实现示例
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum LampProperty {
///     Brightness,
/// }
///
/// impl AnimProperty for LampProperty {
///     fn name(&self) -> &'static str {
///         "brightness"
///     }
///
///     fn all() -> &'static [Self] {
///         &[LampProperty::Brightness]
///     }
/// }
/// ```
pub trait AnimProperty: Copy + Eq + Hash + Debug + 'static {
    /// 属性名称（camelCase，与编排文件一致）
    fn name(&self) -> &'static str;

    /// 实体声明的全部槽位
    fn all() -> &'static [Self];

    /// 按名称查找槽位
    ///
    /// 忽略大小写与下划线，`positionZ` 与 `position_z` 等价。
    fn from_name(name: &str) -> AnimResult<Self> {
        let wanted = normalize(name);
        Self::all()
            .iter()
            .copied()
            .find(|p| normalize(p.name()) == wanted)
            .ok_or_else(|| AnimError::invalid_property(name))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// 可动画实体接口
///
/// 实体通过实现此 trait 声明自己有哪些槽位可以被动画，
/// 并提供每个槽位的当前值。
pub trait Animatable: 'static {
    /// 实体的槽位类型
    type Property: AnimProperty;

    /// 读取槽位当前值
    fn value(&self, property: Self::Property) -> f32;

    /// 写入槽位当前值
    fn set_value(&mut self, property: Self::Property, value: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum LampProperty {
        Brightness,
        ColorTemperature,
    }

    impl AnimProperty for LampProperty {
        fn name(&self) -> &'static str {
            match self {
                LampProperty::Brightness => "brightness",
                LampProperty::ColorTemperature => "colorTemperature",
            }
        }

        fn all() -> &'static [Self] {
            &[LampProperty::Brightness, LampProperty::ColorTemperature]
        }
    }

    #[derive(Default)]
    struct Lamp {
        brightness: f32,
        color_temperature: f32,
    }

    impl Animatable for Lamp {
        type Property = LampProperty;

        fn value(&self, property: LampProperty) -> f32 {
            match property {
                LampProperty::Brightness => self.brightness,
                LampProperty::ColorTemperature => self.color_temperature,
            }
        }

        fn set_value(&mut self, property: LampProperty, value: f32) {
            match property {
                LampProperty::Brightness => self.brightness = value,
                LampProperty::ColorTemperature => self.color_temperature = value,
            }
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            LampProperty::from_name("brightness"),
            Ok(LampProperty::Brightness)
        );
        assert_eq!(
            LampProperty::from_name("color_temperature"),
            Ok(LampProperty::ColorTemperature)
        );
        assert_eq!(
            LampProperty::from_name("ColorTemperature"),
            Ok(LampProperty::ColorTemperature)
        );
    }

    #[test]
    fn test_from_name_unknown() {
        let err = LampProperty::from_name("hue").unwrap_err();
        assert_eq!(
            err,
            AnimError::InvalidPropertyKind {
                name: "hue".to_string()
            }
        );
    }

    #[test]
    fn test_animatable() {
        let mut lamp = Lamp::default();
        lamp.set_value(LampProperty::Brightness, 0.8);
        assert_eq!(lamp.value(LampProperty::Brightness), 0.8);
        assert_eq!(lamp.value(LampProperty::ColorTemperature), 0.0);
    }
}
