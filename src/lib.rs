//! Student Records - 学生成绩管理后端服务
//!
//! 基于 Actix Web 构建，负责学生档案、成绩计算和统计汇总。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis），缓存统计结果
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 成绩计算与统计汇总
//! - `middlewares`: 限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
