//! 설치된 키보드 레이아웃 목록
//! Carbon API의 TIS (Text Input Source) 함수 사용

use core_foundation::array::CFArrayRef;
use core_foundation::base::{CFRelease, CFType, CFTypeRef, TCFType};
use core_foundation::boolean::{CFBoolean, CFBooleanRef};
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
use core_foundation::string::{CFString, CFStringRef};

use crate::input_source::{KeyboardLayout, LayoutList};

type TISInputSourceRef = *mut std::ffi::c_void;
type CFIndex = isize;

#[link(name = "Carbon", kind = "framework")]
extern "C" {
    fn TISCreateInputSourceList(
        properties: CFDictionaryRef,
        includeAllInstalled: bool,
    ) -> CFArrayRef;
    fn TISGetInputSourceProperty(
        inputSource: TISInputSourceRef,
        propertyKey: CFStringRef,
    ) -> CFTypeRef;

    static kTISPropertyInputSourceID: CFStringRef;
    static kTISPropertyLocalizedName: CFStringRef;
    static kTISPropertyInputSourceType: CFStringRef;
    static kTISPropertyInputSourceIsASCIICapable: CFStringRef;
    static kTISPropertyInputSourceIsEnabled: CFStringRef;
    static kTISTypeKeyboardLayout: CFStringRef;
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFArrayGetCount(theArray: CFArrayRef) -> CFIndex;
    fn CFArrayGetValueAtIndex(theArray: CFArrayRef, idx: CFIndex) -> *const std::ffi::c_void;
}

unsafe fn string_property(source: TISInputSourceRef, key: CFStringRef) -> Option<String> {
    let value = TISGetInputSourceProperty(source, key);
    if value.is_null() {
        return None;
    }
    Some(CFString::wrap_under_get_rule(value as CFStringRef).to_string())
}

unsafe fn bool_property(source: TISInputSourceRef, key: CFStringRef) -> bool {
    let value = TISGetInputSourceProperty(source, key);
    if value.is_null() {
        return false;
    }
    CFBoolean::wrap_under_get_rule(value as CFBooleanRef).into()
}

/// ASCII 입력이 가능한 키보드 레이아웃 (설치된 것 전부, 정렬됨)
pub fn list() -> Result<LayoutList, String> {
    let mut layouts = Vec::new();

    unsafe {
        let filter: CFDictionary<CFString, CFType> = CFDictionary::from_CFType_pairs(&[
            (
                CFString::wrap_under_get_rule(kTISPropertyInputSourceType),
                CFString::wrap_under_get_rule(kTISTypeKeyboardLayout).as_CFType(),
            ),
            (
                CFString::wrap_under_get_rule(kTISPropertyInputSourceIsASCIICapable),
                CFBoolean::true_value().as_CFType(),
            ),
        ]);

        let source_list = TISCreateInputSourceList(filter.as_concrete_TypeRef(), true);
        if source_list.is_null() {
            return Err("입력 소스 목록을 가져올 수 없습니다".to_string());
        }

        let count = CFArrayGetCount(source_list);
        for i in 0..count {
            let source = CFArrayGetValueAtIndex(source_list, i) as TISInputSourceRef;
            if source.is_null() {
                continue;
            }
            let Some(identifier) = string_property(source, kTISPropertyInputSourceID) else {
                continue;
            };
            let localized_name =
                string_property(source, kTISPropertyLocalizedName).unwrap_or_else(|| identifier.clone());
            let enabled = bool_property(source, kTISPropertyInputSourceIsEnabled);
            layouts.push(KeyboardLayout {
                identifier,
                localized_name,
                enabled,
            });
        }

        CFRelease(source_list as CFTypeRef);
    }

    log::debug!("키보드 레이아웃 {}개", layouts.len());
    Ok(LayoutList::new(layouts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_source::ABC_LAYOUT_ID;

    #[test]
    #[ignore] // GUI 환경에서만 테스트 가능
    fn test_list_contains_abc() {
        let layouts = list().unwrap();
        assert_eq!(layouts.index_of(ABC_LAYOUT_ID), Some(0));
    }
}
