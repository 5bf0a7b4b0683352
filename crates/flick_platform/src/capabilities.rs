//! Host capability probing

/// Which flavour of CSS transform the host supports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransformSupport {
    /// Unprefixed `transform`
    #[default]
    Standard,
    /// Vendor-prefixed `webkitTransform`
    Webkit,
    /// No transform support at all
    Unsupported,
}

impl TransformSupport {
    /// Probe a style declaration by the property names it exposes
    pub fn detect<'a>(properties: impl Iterator<Item = &'a str>) -> Self {
        let mut webkit = false;
        for name in properties {
            match name {
                "transform" => return TransformSupport::Standard,
                "webkitTransform" => webkit = true,
                _ => {}
            }
        }
        if webkit {
            TransformSupport::Webkit
        } else {
            TransformSupport::Unsupported
        }
    }

    /// Style property name to write transforms to
    pub fn property_name(&self) -> Option<&'static str> {
        match self {
            TransformSupport::Standard => Some("transform"),
            TransformSupport::Webkit => Some("webkitTransform"),
            TransformSupport::Unsupported => None,
        }
    }

    /// Name of the transition-end event matching this flavour
    pub fn transition_end_event(&self) -> Option<&'static str> {
        match self {
            TransformSupport::Standard => Some("transitionend"),
            TransformSupport::Webkit => Some("webkitTransitionEnd"),
            TransformSupport::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, TransformSupport::Unsupported)
    }
}

/// What the host environment can do
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    pub transform: TransformSupport,
}

impl HostCapabilities {
    pub fn new(transform: TransformSupport) -> Self {
        Self { transform }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_standard() {
        let names = ["color", "webkitTransform", "transform"];
        assert_eq!(
            TransformSupport::detect(names.iter().copied()),
            TransformSupport::Standard
        );
    }

    #[test]
    fn test_detect_webkit_fallback() {
        let names = ["webkitTransform", "opacity"];
        let support = TransformSupport::detect(names.iter().copied());
        assert_eq!(support, TransformSupport::Webkit);
        assert_eq!(support.transition_end_event(), Some("webkitTransitionEnd"));
    }

    #[test]
    fn test_detect_unsupported() {
        let support = TransformSupport::detect(["opacity"].iter().copied());
        assert!(!support.is_supported());
        assert_eq!(support.property_name(), None);
    }
}
