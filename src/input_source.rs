//! 기본 키보드 레이아웃(로마자 자판) 목록 정렬과 선택

/// macOS ABC 레이아웃 ID
pub const ABC_LAYOUT_ID: &str = "com.apple.keylayout.ABC";

/// ASCII 입력이 가능한 키보드 레이아웃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub identifier: String,
    pub localized_name: String,
    pub enabled: bool,
}

impl KeyboardLayout {
    pub fn new(identifier: impl Into<String>, localized_name: impl Into<String>, enabled: bool) -> Self {
        Self {
            identifier: identifier.into(),
            localized_name: localized_name.into(),
            enabled,
        }
    }
}

/// ABC 먼저, 그 다음 활성화된 레이아웃, 마지막으로 이름순
pub fn sort_layouts(layouts: &mut [KeyboardLayout]) {
    layouts.sort_by(|a, b| {
        let a_abc = a.identifier == ABC_LAYOUT_ID;
        let b_abc = b.identifier == ABC_LAYOUT_ID;
        b_abc
            .cmp(&a_abc)
            .then_with(|| b.enabled.cmp(&a.enabled))
            .then_with(|| a.localized_name.cmp(&b.localized_name))
    });
}

/// 정렬된 레이아웃 목록 (콤보 박스 데이터 소스)
#[derive(Debug, Clone, Default)]
pub struct LayoutList {
    layouts: Vec<KeyboardLayout>,
}

impl LayoutList {
    pub fn new(mut layouts: Vec<KeyboardLayout>) -> Self {
        sort_layouts(&mut layouts);
        Self { layouts }
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyboardLayout> {
        self.layouts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyboardLayout> {
        self.layouts.iter()
    }

    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.layouts.iter().position(|l| l.identifier == identifier)
    }

    pub fn index_of_name(&self, localized_name: &str) -> Option<usize> {
        self.layouts
            .iter()
            .position(|l| l.localized_name == localized_name)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index_of(identifier).is_some()
    }

    /// 입력 중인 문자열로 시작하는 첫 레이아웃 이름 (자동 완성)
    pub fn complete(&self, prefix: &str) -> Option<&str> {
        self.layouts
            .iter()
            .find(|l| l.localized_name.starts_with(prefix))
            .map(|l| l.localized_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayoutList {
        LayoutList::new(vec![
            KeyboardLayout::new("com.apple.keylayout.Dvorak", "Dvorak", false),
            KeyboardLayout::new("com.apple.keylayout.US", "U.S.", true),
            KeyboardLayout::new("com.apple.keylayout.Colemak", "Colemak", false),
            KeyboardLayout::new(ABC_LAYOUT_ID, "ABC", false),
            KeyboardLayout::new("com.apple.keylayout.British", "British", true),
        ])
    }

    #[test]
    fn test_sort_order() {
        let list = sample();
        let names: Vec<_> = list.iter().map(|l| l.localized_name.as_str()).collect();
        assert_eq!(names, vec!["ABC", "British", "U.S.", "Colemak", "Dvorak"]);
    }

    #[test]
    fn test_index_lookup() {
        let list = sample();
        assert_eq!(list.index_of(ABC_LAYOUT_ID), Some(0));
        assert_eq!(list.index_of_name("U.S."), Some(2));
        assert_eq!(list.index_of("com.apple.keylayout.Nope"), None);
    }

    #[test]
    fn test_complete() {
        let list = sample();
        assert_eq!(list.complete("Co"), Some("Colemak"));
        assert_eq!(list.complete("B"), Some("British"));
        assert_eq!(list.complete("Z"), None);
    }
}
