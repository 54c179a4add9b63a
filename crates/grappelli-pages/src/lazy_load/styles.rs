//! Stylesheet for the lazy-load CSS classes

/// CSS targeting the classes toggled by the lazy-load directive.
///
/// Placeholder data URIs get an animated shimmer, which is switched off for
/// users who prefer reduced motion.
pub const LAZY_LOAD_STYLES: &str = r#"
.lazy-image {
  transition: opacity 0.3s ease;
}

.lazy-loading {
  opacity: 0.7;
}

.lazy-loaded {
  opacity: 1;
}

.lazy-error {
  opacity: 0.5;
  filter: grayscale(100%);
}

.lazy-image[src*="data:image/svg+xml"] {
  background-color: #f3f4f6;
  background-image: linear-gradient(45deg, transparent 25%, rgba(255,255,255,0.2) 25%, rgba(255,255,255,0.2) 75%, transparent 75%, transparent),
                    linear-gradient(45deg, transparent 25%, rgba(255,255,255,0.2) 25%, rgba(255,255,255,0.2) 75%, transparent 75%, transparent);
  background-size: 20px 20px;
  background-position: 0 0, 10px 10px;
  animation: lazy-shimmer 2s infinite linear;
}

@keyframes lazy-shimmer {
  0% {
    background-position: 0 0, 10px 10px;
  }
  100% {
    background-position: 20px 20px, 30px 30px;
  }
}

@media (prefers-reduced-motion: reduce) {
  .lazy-image {
    transition: none;
  }

  .lazy-image[src*="data:image/svg+xml"] {
    animation: none;
  }
}
"#;
