/// UUID v7 ベースの ID 型を定義する宣言型マクロ
///
/// 以下をまとめて生成する:
/// - Newtype 構造体（`Uuid` をラップ）
/// - `derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `new()`: UUID v7 を生成（生成順にソート可能）
/// - `from_uuid()` / `as_uuid()` / `into_uuid()`
/// - `Default` impl（`new()` に委譲）
///
/// Serialize は内部 UUID をそのまま文字列として出力する（`#[serde(transparent)]`）。
///
/// # 使用例
///
/// ```rust
/// use recipebox_domain::favorite::FavoriteId;
///
/// let id = FavoriteId::new();
/// let restored = FavoriteId::from_uuid(*id.as_uuid());
/// assert_eq!(id, restored);
/// ```
macro_rules! define_uuid_id {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            /// 新しい ID を生成する（UUID v7）
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// 既存の UUID から ID を作成する
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// 内部の UUID 参照を取得する
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// 内部の UUID を取り出す
            pub fn into_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
