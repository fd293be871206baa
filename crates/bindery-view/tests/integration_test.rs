use std::{cell::RefCell, rc::Rc};

use bindery_view::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Profile {
    name: String,
    visits: u32,
}

/// A stand-in for a toolkit label.
#[derive(Default)]
struct Label {
    text: String,
    draws: usize,
}

impl Refresh<String> for Label {
    fn refresh(&mut self, value: &String) {
        self.text = value.clone();
        self.draws += 1;
    }
}

fn profile() -> Profile {
    Profile {
        name: "Ada".to_string(),
        visits: 0,
    }
}

#[test]
fn lifecycle_view_follows_controller_edits() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut cache = ControllerCache::new();
    let controller = cache.get_or_insert_with("profile", || Controller::new("profile", root(profile()), ()));
    let name = controller.property().focus(lens!(Profile, name));
    let mut host = ViewHost::new(name.readonly(), Label::default());

    host.load().unwrap();
    assert_eq!(host.view().text, "Ada");

    controller.apply(|p| Profile { visits: 1, ..p });
    assert_eq!(host.pump().unwrap(), 0);

    controller.apply(|p| Profile {
        name: "Grace".to_string(),
        ..p
    });
    assert_eq!(host.pump().unwrap(), 1);
    assert_eq!(host.view().text, "Grace");
    assert_eq!(host.view().draws, 2);

    host.unload();
    let controller = cache.get_mut(&"profile").unwrap();
    assert_eq!(controller.snapshot().visits, 1);
}

#[test]
fn observed_object_notifies_on_each_synced_change() {
    let model = root(profile());
    let visits = model.focus(lens!(Profile, visits));
    let mut observed = Observed::new(Controller::new(1u8, model.clone(), ()));
    let log = Rc::new(RefCell::new(Vec::<u32>::new()));
    observed.on_change({
        let log = log.clone();
        move |p: &Profile| log.borrow_mut().push(p.visits)
    });

    visits.set(1);
    assert!(observed.sync());
    visits.set(1);
    observed.send(|p| Profile { visits: p.visits + 1, ..p });
    observed.send(|p| p);

    assert_eq!(observed.value().visits, 2);
    assert_eq!(*log.borrow(), vec![1, 2]);
    assert_eq!(observed.revision(), 2);
}

#[test]
fn erased_properties_drive_the_same_view_type() {
    let model = root(profile());
    let greeting = model.map(|p| format!("Hello, {}", p.name)).erase();
    let plain = root("static".to_string()).erase();

    let mut hosts: Vec<ViewHost<AnyProperty<String>, Label>> = vec![
        ViewHost::new(greeting, Label::default()),
        ViewHost::new(plain, Label::default()),
    ];
    for host in hosts.iter_mut() {
        host.load().unwrap();
    }
    model.modify(|p| Profile {
        name: "Linus".to_string(),
        ..p
    });
    let pumped: Vec<usize> = hosts.iter_mut().map(|h| h.pump().unwrap()).collect();
    assert_eq!(pumped, vec![1, 0]);
    assert_eq!(hosts[0].view().text, "Hello, Linus");
    assert_eq!(hosts[1].view().text, "static");
}
