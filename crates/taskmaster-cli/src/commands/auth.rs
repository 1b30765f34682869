use taskmaster_core::{Credentials, Database, IdentityProvider, LocalIdentity};

pub fn login(username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let user = LocalIdentity::new(&db).login(&Credentials::new(username, password))?;
    println!("Logged in as {}", user.username);
    Ok(())
}

pub fn logout() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    LocalIdentity::new(&db).logout()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match LocalIdentity::new(&db).current_user()? {
        Some(user) => println!("{}", user.username),
        None => {
            eprintln!("not logged in");
            std::process::exit(1);
        }
    }
    Ok(())
}
