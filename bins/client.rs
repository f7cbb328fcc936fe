use clap::Parser;
use client::RpcClient;
use models::messages::{
    AddRoleRequest, AddUserRequest, FindRoleRequest, FindRolesRequest, FindUserRequest,
    FindUsersRequest,
};
use models::{Permission, Role, RoleName, User};
use rand::seq::SliceRandom;
use service::{Code, RoleService, Status, UserService};
use tracing::{info, warn};
use uuid::Uuid;

/// Walks through every RPC method against a running server.
#[derive(Debug, Parser)]
#[command(name = "client", version)]
struct Cli {
    /// RPC listener, `host:port` or a base URL
    #[arg(long, default_value = "127.0.0.1:8080")]
    address: String,
}

const NAMES: [&str; 3] = ["Ashish", "Pratik", "Rajat"];
const ADDRESSES: [&str; 3] = ["Pune", "Mumbai", "Nashik"];

fn pick(set: &[&'static str]) -> &'static str {
    set.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

/// Log a failed call; conflicts and missing records are expected outcomes.
fn report(what: &str, status: &Status) {
    match status.code() {
        Code::AlreadyExists => info!("{what} already exists"),
        Code::NotFound => info!("{what} not found"),
        _ => warn!(code = %status.code(), message = status.message(), "{what} call failed"),
    }
}

fn log_role(role: &Role) {
    info!(name = %role.name, permissions = ?role.permissions, "  role");
}

fn log_user(user: &User) {
    info!(id = %user.id, name = %user.name, address = %user.address, "  user");
    for role in &user.roles {
        log_role(role);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();
    let cli = Cli::parse();

    let rpc = RpcClient::new(&cli.address)?;
    info!(server = rpc.base_url(), "dial server");

    info!("1. add role");
    let owner = Role::new(RoleName::Owner, [Permission::Read, Permission::Readwrite]);
    match rpc.add_role(AddRoleRequest { role: owner }).await {
        Ok(res) => info!(name = %res.name, "role created"),
        Err(status) => report("role", &status),
    }

    info!("2. list all roles");
    match rpc.find_roles(FindRolesRequest {}).await {
        Ok(res) => res.roles.iter().for_each(log_role),
        Err(status) => report("roles", &status),
    }

    info!("3. fetch role");
    let fetched = match rpc.find_role(FindRoleRequest { name: RoleName::Owner.to_string() }).await {
        Ok(res) => {
            log_role(&res.role);
            Some(res.role)
        }
        Err(status) => {
            report("role", &status);
            None
        }
    };

    info!("4. add user");
    let mut roles: Vec<Role> = fetched.into_iter().collect();
    roles.push(Role::new(RoleName::Admin, [Permission::Readwrite]));
    let user = User::new(pick(&NAMES), pick(&ADDRESSES))
        .with_id(Uuid::new_v4().to_string())
        .with_roles(roles);
    let user_id = match rpc.add_user(AddUserRequest { user }).await {
        Ok(res) => {
            info!(id = %res.id, "user added");
            Some(res.id)
        }
        Err(status) => {
            report("user", &status);
            None
        }
    };

    info!("5. list all users");
    match rpc.find_users(FindUsersRequest {}).await {
        Ok(res) => res.users.iter().for_each(log_user),
        Err(status) => report("users", &status),
    }

    info!("6. fetch user");
    if let Some(id) = user_id {
        match rpc.find_user(FindUserRequest { id }).await {
            Ok(res) => log_user(&res.user),
            Err(status) => report("user", &status),
        }
    }
    Ok(())
}
