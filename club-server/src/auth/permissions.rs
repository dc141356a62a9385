//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 基础操作（查看课表、会员查询、查看排班）无需权限，登录即可使用
//! - 模块化权限：按功能模块授权
//! - 用户管理：仅 admin 角色可用（is_system 保护）

/// 可配置权限列表（11 项）
/// 不包含 "all" 和 "users:manage"，这些是系统级权限
pub const ALL_PERMISSIONS: &[&str] = &[
    "members:manage",       // 会员档案管理（建档/修改/停用）
    "access:monitor",       // 门禁打卡与监控
    "schedule:manage",      // 课表模板与课次管理
    "reservations:manage",  // 课程预约管理
    "subscriptions:manage", // 会籍管理（开卡/续费/取消）
    "sales:register",       // 前台销售
    "assets:manage",        // 器材管理
    "maintenance:manage",   // 维修工单管理
    "cleaning:manage",      // 清洁任务与排班管理
    "reports:view",         // 报表查看
    "settings:manage",      // 系统设置
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "users:manage", // 员工与角色管理
    "all",          // 超级权限
];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 馆长角色默认权限（全部可配置权限）
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "members:manage",
    "access:monitor",
    "schedule:manage",
    "reservations:manage",
    "subscriptions:manage",
    "sales:register",
    "assets:manage",
    "maintenance:manage",
    "cleaning:manage",
    "reports:view",
    "settings:manage",
];

/// 前台角色默认权限
pub const DEFAULT_RECEPTIONIST_PERMISSIONS: &[&str] = &[
    "members:manage",
    "access:monitor",
    "reservations:manage",
    "subscriptions:manage",
    "sales:register",
];

/// 教练角色默认权限（签到自己的课）
pub const DEFAULT_COACH_PERMISSIONS: &[&str] = &["reservations:manage"];

/// 清洁员角色默认权限（查看并完成自己的排班，无需额外权限）
pub const DEFAULT_CLEANER_PERMISSIONS: &[&str] = &[];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    let perms: &[&str] = match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS,
        "manager" => DEFAULT_MANAGER_PERMISSIONS,
        "receptionist" => DEFAULT_RECEPTIONIST_PERMISSIONS,
        "coach" => DEFAULT_COACH_PERMISSIONS,
        "cleaner" => DEFAULT_CLEANER_PERMISSIONS,
        _ => &[],
    };
    perms.iter().map(|s| s.to_string()).collect()
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}

/// 登录后按角色跳转的前端入口
pub fn role_dashboard(role_name: &str) -> &'static str {
    match role_name {
        "admin" => "/dashboard/admin",
        "manager" => "/dashboard/manager",
        "receptionist" => "/dashboard/reception",
        "coach" => "/dashboard/coach",
        "cleaner" => "/dashboard/cleaning",
        _ => "/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_permissions_are_valid() {
        for role in ["admin", "manager", "receptionist", "coach", "cleaner"] {
            for perm in get_default_permissions(role) {
                assert!(is_valid_permission(&perm), "invalid permission: {}", perm);
            }
        }
    }

    #[test]
    fn test_unknown_role_gets_nothing() {
        assert!(get_default_permissions("barista").is_empty());
        assert_eq!(role_dashboard("barista"), "/dashboard");
    }
}
