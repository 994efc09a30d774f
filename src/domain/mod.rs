// 領域層：資料模型與對外介面（ports），不依賴 HTTP 或模型供應商。

pub mod model;
pub mod ports;
