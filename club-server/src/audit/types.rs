//! 审计日志类型定义
//!
//! 审计日志的核心数据结构。
//! 所有条目不可变、不可删除，支持 SHA256 哈希链防篡改。

use serde::{Deserialize, Serialize};

/// 审计操作类型（枚举，非自由文本）
///
/// 按领域分组，确保每个敏感操作都有明确的类型标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ 系统生命周期 ═══
    /// 系统正常启动
    SystemStartup,
    /// 系统正常关闭
    SystemShutdown,

    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,
    /// 登出
    Logout,

    // ═══ 管理操作 ═══
    /// 员工创建
    EmployeeCreated,
    /// 员工更新
    EmployeeUpdated,
    /// 员工删除
    EmployeeDeleted,
    /// 角色创建
    RoleCreated,
    /// 角色更新
    RoleUpdated,
    /// 角色删除
    RoleDeleted,

    // ═══ 会员 ═══
    /// 会员建档
    MemberCreated,
    /// 会员资料更新
    MemberUpdated,
    /// 会员停用
    MemberDeactivated,

    // ═══ 门禁 ═══
    /// 门禁放行
    AccessGranted,
    /// 门禁拒绝
    AccessDenied,

    // ═══ 课表 ═══
    /// 课次批量生成
    SessionsGenerated,
    /// 课次取消
    SessionCancelled,
    /// 课次完成
    SessionCompleted,

    // ═══ 预约 ═══
    /// 预约创建
    ReservationCreated,
    /// 预约取消
    ReservationCancelled,
    /// 预约签到
    ReservationCheckedIn,

    // ═══ 销售（财务关键）═══
    /// 销售记账
    SaleRegistered,

    // ═══ 会籍 ═══
    /// 会籍开通
    SubscriptionCreated,
    /// 会籍续费
    SubscriptionRenewed,
    /// 会籍取消
    SubscriptionCancelled,
    /// 会籍到期（后台任务）
    SubscriptionExpired,

    // ═══ 器材 ═══
    /// 器材登记
    AssetCreated,
    /// 器材更新
    AssetUpdated,
    /// 器材报废
    AssetRetired,

    // ═══ 维修 ═══
    /// 维修工单开立
    MaintenanceOpened,
    /// 维修开始
    MaintenanceStarted,
    /// 维修关闭
    MaintenanceClosed,
    /// 维修工单作废
    MaintenanceCancelled,

    // ═══ 清洁 ═══
    /// 清洁排班
    CleaningAssigned,
    /// 清洁完成
    CleaningCompleted,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 审计日志条目（不可变）
///
/// 每条记录包含 SHA256 哈希链，确保防篡改。
/// - `prev_hash`: 前一条记录的哈希
/// - `curr_hash`: 当前记录的哈希（包含 prev_hash + 所有字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 全局递增序列号（唯一标识）
    pub id: u64,
    /// 时间戳（Unix 毫秒）
    pub timestamp: i64,
    /// 操作类型
    pub action: AuditAction,
    /// 资源类型（如 "member", "sale", "system"）
    pub resource_type: String,
    /// 资源 ID（如 "member:xxx", "sale:yyy"）
    pub resource_id: String,
    /// 操作人 ID（系统事件为 None）
    pub operator_id: Option<String>,
    /// 操作人名称
    pub operator_name: Option<String>,
    /// 结构化详情（JSON）
    pub details: serde_json::Value,
    /// 前一条审计日志哈希
    pub prev_hash: String,
    /// 当前记录哈希（SHA256）
    pub curr_hash: String,
}

/// 审计日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 操作类型过滤
    pub action: Option<AuditAction>,
    /// 操作人 ID 过滤
    pub operator_id: Option<String>,
    /// 资源类型过滤
    pub resource_type: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// 审计日志列表响应
#[derive(Debug, Serialize)]
pub struct AuditListResponse {
    pub items: Vec<AuditEntry>,
    pub total: u64,
}

/// 审计链验证结果
#[derive(Debug, Serialize)]
pub struct AuditChainVerification {
    /// 验证的记录总数
    pub total_entries: u64,
    /// 链是否完整
    pub chain_intact: bool,
    /// 断裂点列表
    pub breaks: Vec<AuditChainBreak>,
}

/// 审计链断裂点
#[derive(Debug, Serialize)]
pub struct AuditChainBreak {
    /// 断裂处的序列号
    pub entry_id: u64,
    /// 期望的哈希
    pub expected: String,
    /// 实际的哈希
    pub actual: String,
}
