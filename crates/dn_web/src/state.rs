use dn_view::ViewController;

#[derive(Clone)]
pub struct AppState {
    pub controller: ViewController,
}

impl AppState {
    pub fn new(controller: ViewController) -> Self {
        Self { controller }
    }
}
