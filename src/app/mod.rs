// 應用層：場景組裝與依序執行
pub mod scenarios;
