// src/bidding/size_map.rs

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::model::placements::Size;

/// ServerBid 尺寸编码表，下标即编码。
/// 服务端按位置解释编码，顺序与重复项（1、2 都是 120x90）必须保持原样
pub const SIZE_MAP: [Option<&str>; 29] = [
    None,
    Some("120x90"),
    Some("120x90"),
    Some("468x60"),
    Some("728x90"),
    Some("300x250"),
    Some("160x600"),
    Some("120x600"),
    Some("300x100"),
    Some("180x150"),
    Some("336x280"),
    Some("240x400"),
    Some("234x60"),
    Some("88x31"),
    Some("120x60"),
    Some("120x240"),
    Some("125x125"),
    Some("220x250"),
    Some("250x250"),
    Some("250x90"),
    Some("0x0"),
    Some("200x90"),
    Some("300x50"),
    Some("320x50"),
    Some("320x480"),
    Some("185x185"),
    Some("620x45"),
    Some("300x125"),
    Some("800x250"),
];

// 反向索引，重复尺寸保留最小下标
static CODE_BY_SIZE: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (code, size) in SIZE_MAP.iter().enumerate() {
        if let Some(size) = size {
            index.entry(*size).or_insert(code as u32);
        }
    }
    index
});

/// 尺寸 → 编码，表中没有的尺寸返回 None
pub fn code_for(width: u32, height: u32) -> Option<u32> {
    CODE_BY_SIZE.get(format!("{}x{}", width, height).as_str()).copied()
}

/// 编码 → 尺寸
pub fn size_for(code: u32) -> Option<Size> {
    let entry = SIZE_MAP.get(code as usize).copied().flatten()?;
    let (w, h) = entry.split_once('x')?;
    Some(Size(w.parse().ok()?, h.parse().ok()?))
}

/// 把尺寸列表映射为广告类型编码，未匹配的尺寸直接跳过，顺序保持不变
pub fn ad_types_for(sizes: &[Size]) -> Vec<u32> {
    sizes
        .iter()
        .filter_map(|size| code_for(size.width(), size.height()))
        .collect()
}
