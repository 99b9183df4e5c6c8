/// 名称规范化: 小写、内部连续空白折叠为单个空格、去首尾空白
///
/// 账单名称和参考表名称都先经过这里再比较, 这是唯一的模糊匹配手段。
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
