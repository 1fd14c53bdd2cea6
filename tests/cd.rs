// Changes the process cwd and HOME, so it lives in its own test binary.

use std::env;
use std::fs;

use stage::{Config, Flow, Session};

#[test]
fn cd_builtin() {
    let home = tempfile::tempdir().unwrap();
    let home_path = fs::canonicalize(home.path()).unwrap();
    fs::create_dir(home_path.join("sub")).unwrap();
    env::set_var("HOME", &home_path);

    let mut sh = Session::new(Config::quiet(), Vec::<u8>::new(), Vec::<u8>::new());
    let before = env::current_dir().unwrap();

    assert_eq!(
        sh.execute_line("cd /nonexistent-path-xyz").unwrap(),
        Flow::Continue
    );
    assert_eq!(env::current_dir().unwrap(), before);
    let err = String::from_utf8_lossy(sh.err()).into_owned();
    assert!(err.starts_with("stage: cd: /nonexistent-path-xyz: "), "{}", err);

    sh.execute_line("cd").unwrap();
    assert_eq!(env::current_dir().unwrap(), home_path);
    assert!(sh.prompt().starts_with(&home_path.display().to_string()));

    sh.execute_line("cd sub").unwrap();
    assert_eq!(env::current_dir().unwrap(), home_path.join("sub"));

    sh.execute_line("cd ..").unwrap();
    assert_eq!(env::current_dir().unwrap(), home_path);
    assert_eq!(String::from_utf8_lossy(sh.err()).lines().count(), 1);

    env::set_current_dir(&before).unwrap();
}
