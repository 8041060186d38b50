/// ページサイズの既定値
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// ページサイズの上限
pub const MAX_PAGE_SIZE: u32 = 100;

/// ページ指定（0始まりのページ番号とページサイズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// ページ指定を作成する
    ///
    /// サイズは 1..=MAX_PAGE_SIZE に丸める。
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 先頭から読み飛ばす件数
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// 検索結果の1ページ
///
/// `total_elements` はページングする前の一致件数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub request: PageRequest,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            request,
            total_elements,
        }
    }

    /// 一致した全件からページを切り出す
    pub fn slice(matches: Vec<T>, request: PageRequest) -> Self {
        let total_elements = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size() as usize)
            .collect();
        Self::new(content, request, total_elements)
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.request.size()))
    }
}
