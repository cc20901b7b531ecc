use gatehouse_model::{Role, User, UserStatus};

pub fn admin(id: &str) -> User {
    User::new(id, format!("{id}@example.com"), Role::Admin, UserStatus::Active)
        .with_full_name(format!("Admin {id}"))
}

pub fn member(id: &str) -> User {
    User::new(id, format!("{id}@example.com"), Role::Member, UserStatus::Active)
        .with_full_name(format!("Member {id}"))
}

/// `u1` is an admin, `u2..=u{count}` are members; every third member is inactive
pub fn population(count: usize) -> Vec<User> {
    (1..=count)
        .map(|n| {
            let id = format!("u{n}");
            if n == 1 {
                return admin(&id);
            }
            let mut user = member(&id);
            if n % 3 == 0 {
                user.status = UserStatus::Inactive;
            }
            user
        })
        .collect()
}
